// ABOUTME: Control-plane facade for Elastic Beanstalk and S3.
// ABOUTME: Capability traits, shared types, and the AWS SDK backed implementation.

mod aws;
mod error;
mod traits;

pub use aws::AwsPlatform;
pub use error::{PlatformError, PlatformErrorKind};
pub use traits::*;
