pub mod aggregate;
pub mod comment;
pub mod consultation;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod view;
pub mod wordcloud;

pub use aggregate::{ConfidenceBuckets, StakeholderCount, StanceCount, Summary, summarize};
pub use comment::{Comment, Stance};
pub use consultation::{ConsultationMeta, ConsultationStatus, LoadedConsultation, Provenance};
pub use error::CoreError;
pub use filter::{FilteredView, StanceFilter, filter_comments};
pub use normalize::{normalize_row, normalize_rows};
pub use view::{FetchTicket, ViewSession, ViewState};
pub use wordcloud::{WordCloudAsset, WordCloudTable};
