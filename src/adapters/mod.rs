// Adapters layer: concrete clients for the tracker, the music catalog and the email service.

pub mod gazelle;
pub mod http;
pub mod itunes;
pub mod postmark;

pub use gazelle::GazelleClient;
pub use itunes::ItunesClient;
pub use postmark::PostmarkClient;
