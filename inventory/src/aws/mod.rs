mod ec2;
mod eks;
mod profiles;
mod session;

pub use profiles::{credentials_path, expand_home, load_profile_names};
pub use session::{AwsRegions, AwsSession, AwsSessions};
