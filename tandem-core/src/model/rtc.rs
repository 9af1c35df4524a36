//! Bridges to the `webrtc` crate so a host negotiation engine can apply delivered facts directly.

use crate::model::{Candidate, Description, RelayServer, SdpKind};
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

impl From<&Candidate> for RTCIceCandidateInit {
    fn from(c: &Candidate) -> Self {
        RTCIceCandidateInit {
            candidate: c.content.clone(),
            sdp_mid: Some(c.media_id.clone()),
            sdp_mline_index: u16::try_from(c.media_line_index).ok(),
            ..Default::default()
        }
    }
}

impl From<RTCIceCandidateInit> for Candidate {
    fn from(init: RTCIceCandidateInit) -> Self {
        Candidate {
            media_line_index: init.sdp_mline_index.map(i32::from).unwrap_or(0),
            media_id: init.sdp_mid.unwrap_or_default(),
            content: init.candidate,
        }
    }
}

impl From<&RelayServer> for RTCIceServer {
    fn from(server: &RelayServer) -> Self {
        RTCIceServer {
            urls: vec![server.url.clone()],
            username: server.username.clone(),
            credential: server.credential.clone(),
        }
    }
}

impl Description {
    /// Parses the SDP body into a `webrtc` session description.
    pub fn to_rtc(&self) -> Result<RTCSessionDescription, webrtc::Error> {
        match self.kind {
            SdpKind::Offer => RTCSessionDescription::offer(self.content.clone()),
            SdpKind::Answer => RTCSessionDescription::answer(self.content.clone()),
        }
    }

    /// `None` for provisional answers and rollbacks, which rooms never carry.
    pub fn from_rtc(desc: &RTCSessionDescription) -> Option<Self> {
        let kind = match desc.sdp_type {
            RTCSdpType::Offer => SdpKind::Offer,
            RTCSdpType::Answer => SdpKind::Answer,
            _ => return None,
        };
        Some(Description::new(kind, desc.sdp.clone()))
    }
}
