pub mod enhancer;
pub mod error;
pub mod profile;
pub mod publisher;
pub mod sdp;

pub use enhancer::{EnhancedSdp, SdpEnhancer};
pub use error::{EnhanceError, Result};
pub use profile::Profile;
pub use publisher::{EnhanceMode, OfferOutcome, PreparedOffer, PublisherConfig, prepare_offer};
pub use sdp::corruption::is_corrupted;
pub use sdp::dialect::Dialect;
pub use sdp::fixup::force_h264;
pub use sdp::rewriter::EnhancementRequest;
pub use sdp::selector::{MediaKind, Selection};
