pub mod deploy;
pub mod init;
pub mod status;

pub use deploy::*;
pub use init::*;
pub use status::*;
