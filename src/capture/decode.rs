//! Best-effort transport header decoding for captured frames.
//!
//! Only enough of each frame is decoded to reach the UDP header. Frames that
//! do not carry IPv4/UDP decode to `None`; that is not treated as corruption.

use pcap_parser::Linktype;
use pnet_packet::ethernet::{EtherTypes, EthernetPacket};
use pnet_packet::ip::IpNextHeaderProtocols;
use pnet_packet::ipv4::Ipv4Packet;
use pnet_packet::udp::UdpPacket;
use pnet_packet::Packet;

use super::types::UdpSummary;

/// LLC/SNAP header preceding the ethertype in 802.11 data frames
const LLC_SNAP: [u8; 6] = [0xaa, 0xaa, 0x03, 0x00, 0x00, 0x00];
const ETHERTYPE_IPV4: u16 = 0x0800;

/// IEEE 802.11 without radio header, as written by ns-3 wifi devices
pub const LINKTYPE_IEEE802_11: Linktype = Linktype(105);
/// IEEE 802.11 preceded by a radiotap header
pub const LINKTYPE_IEEE802_11_RADIOTAP: Linktype = Linktype(127);

/// Decode the UDP header carried by a frame of the given link type
pub fn decode_udp(linktype: Linktype, frame: &[u8]) -> Option<UdpSummary> {
    match linktype {
        Linktype::ETHERNET => {
            let eth = EthernetPacket::new(frame)?;
            if eth.get_ethertype() != EtherTypes::Ipv4 {
                return None;
            }
            udp_from_ipv4(eth.payload())
        }
        LINKTYPE_IEEE802_11 => udp_from_80211(frame),
        LINKTYPE_IEEE802_11_RADIOTAP => {
            if frame.len() < 4 {
                return None;
            }
            let header_len = u16::from_le_bytes([frame[2], frame[3]]) as usize;
            udp_from_80211(frame.get(header_len..)?)
        }
        Linktype::RAW | Linktype::IPV4 => udp_from_ipv4(frame),
        _ => None,
    }
}

fn udp_from_80211(frame: &[u8]) -> Option<UdpSummary> {
    let body = ieee80211_body(frame)?;
    if body.len() < LLC_SNAP.len() + 2 || body[..LLC_SNAP.len()] != LLC_SNAP {
        return None;
    }
    let ethertype = u16::from_be_bytes([body[6], body[7]]);
    if ethertype != ETHERTYPE_IPV4 {
        return None;
    }
    udp_from_ipv4(&body[LLC_SNAP.len() + 2..])
}

/// Strip the 802.11 MAC header of a data frame
fn ieee80211_body(frame: &[u8]) -> Option<&[u8]> {
    if frame.len() < 24 {
        return None;
    }
    let frame_control = frame[0];
    let flags = frame[1];

    // Type 2 = data
    if (frame_control >> 2) & 0x03 != 2 {
        return None;
    }
    let subtype = frame_control >> 4;
    // Null-function subtypes carry no body
    if subtype & 0x04 != 0 {
        return None;
    }
    // Protected frames cannot be decoded
    if flags & 0x40 != 0 {
        return None;
    }

    let mut header_len = 24;
    if flags & 0x03 == 0x03 {
        header_len += 6;
    }
    let qos = subtype & 0x08 != 0;
    if qos {
        header_len += 2;
        if flags & 0x80 != 0 {
            header_len += 4;
        }
    }
    frame.get(header_len..)
}

fn udp_from_ipv4(bytes: &[u8]) -> Option<UdpSummary> {
    let ip = Ipv4Packet::new(bytes)?;
    if ip.get_version() != 4 || ip.get_next_level_protocol() != IpNextHeaderProtocols::Udp {
        return None;
    }
    // Only the first fragment carries the UDP header
    if ip.get_fragment_offset() != 0 {
        return None;
    }
    let udp = UdpPacket::new(ip.payload())?;
    Some(UdpSummary {
        source_port: udp.get_source(),
        destination_port: udp.get_destination(),
        length: udp.get_length(),
        checksum: udp.get_checksum(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// IPv4 header (20 bytes) followed by a UDP header and `payload`
    pub(crate) fn ipv4_udp(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
        let udp_len = 8 + payload.len() as u16;
        let total_len = 20 + udp_len;
        let mut bytes = vec![0x45, 0x00];
        bytes.extend_from_slice(&total_len.to_be_bytes());
        bytes.extend_from_slice(&[0x00, 0x01, 0x00, 0x00, 64, 17, 0x00, 0x00]);
        bytes.extend_from_slice(&[10, 1, 1, 1, 10, 1, 1, 2]);
        bytes.extend_from_slice(&src_port.to_be_bytes());
        bytes.extend_from_slice(&dst_port.to_be_bytes());
        bytes.extend_from_slice(&udp_len.to_be_bytes());
        bytes.extend_from_slice(&[0xbe, 0xef]);
        bytes.extend_from_slice(payload);
        bytes
    }

    /// 802.11 data frame (no QoS) with LLC/SNAP encapsulation
    pub(crate) fn wifi_udp(src_port: u16, dst_port: u16) -> Vec<u8> {
        let mut frame = vec![0x08, 0x00, 0x00, 0x00];
        frame.extend_from_slice(&[0xff; 6]);
        frame.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x01]);
        frame.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x02]);
        frame.extend_from_slice(&[0x10, 0x00]);
        frame.extend_from_slice(&LLC_SNAP);
        frame.extend_from_slice(&ETHERTYPE_IPV4.to_be_bytes());
        frame.extend_from_slice(&ipv4_udp(src_port, dst_port, b"slp"));
        frame
    }

    #[test]
    fn test_decode_ethernet_udp() {
        let mut frame = vec![0u8; 12];
        frame.extend_from_slice(&[0x08, 0x00]);
        frame.extend_from_slice(&ipv4_udp(698, 9, b"hello"));

        let udp = decode_udp(Linktype::ETHERNET, &frame).unwrap();
        assert_eq!(udp.source_port, 698);
        assert_eq!(udp.destination_port, 9);
        assert_eq!(udp.length, 13);
        assert_eq!(udp.checksum, 0xbeef);
    }

    #[test]
    fn test_decode_80211_udp() {
        let udp = decode_udp(LINKTYPE_IEEE802_11, &wifi_udp(49153, 9)).unwrap();
        assert_eq!(udp.source_port, 49153);
        assert_eq!(udp.destination_port, 9);
    }

    #[test]
    fn test_decode_radiotap_udp() {
        // Minimal radiotap header: version, pad, length 8, empty present bitmap
        let mut frame = vec![0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00];
        frame.extend_from_slice(&wifi_udp(7000, 9));
        let udp = decode_udp(LINKTYPE_IEEE802_11_RADIOTAP, &frame).unwrap();
        assert_eq!(udp.source_port, 7000);
        assert_eq!(udp.destination_port, 9);

        // Header length pointing past the frame
        assert_eq!(decode_udp(LINKTYPE_IEEE802_11_RADIOTAP, &[0x00, 0x00, 0xff, 0x00]), None);
    }

    #[test]
    fn test_decode_qos_data_frame() {
        let mut frame = wifi_udp(1000, 2000);
        // QoS data subtype adds a two byte QoS control field after the header
        frame[0] = 0x88;
        frame.splice(24..24, [0x00, 0x00]);
        let udp = decode_udp(LINKTYPE_IEEE802_11, &frame).unwrap();
        assert_eq!(udp.source_port, 1000);
        assert_eq!(udp.destination_port, 2000);
    }

    #[test]
    fn test_non_udp_frames_decode_to_none() {
        // Management frame (beacon)
        let mut beacon = vec![0x80, 0x00];
        beacon.extend_from_slice(&[0u8; 40]);
        assert_eq!(decode_udp(LINKTYPE_IEEE802_11, &beacon), None);

        // ARP over Ethernet
        let mut arp = vec![0u8; 12];
        arp.extend_from_slice(&[0x08, 0x06]);
        arp.extend_from_slice(&[0u8; 28]);
        assert_eq!(decode_udp(Linktype::ETHERNET, &arp), None);

        // Truncated raw IP
        let ip = ipv4_udp(1, 2, b"");
        assert_eq!(decode_udp(Linktype::RAW, &ip[..10]), None);
        assert!(decode_udp(Linktype::RAW, &ip).is_some());
    }
}
