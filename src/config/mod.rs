//! Configuration module

mod env_file;
mod site;

pub use env_file::load_env_file;
pub use site::Favicon;
pub use site::RssConfig;
pub use site::SiteConfig;
pub use site::SocialConfig;
pub use site::ThemeConfig;
