pub mod compiler;
pub mod delivery;
pub mod error;
pub mod html;

pub use compiler::{subject_for, ReportCompiler};
pub use delivery::{DeliveryReport, Mailer, SmtpMailer};
pub use error::ReportError;
pub use html::LineRules;
