pub mod config_cmd;
pub mod file_to_volume;
pub mod s3_to_volume;
pub mod volume_to_file;
pub mod volume_to_s3;

pub use config_cmd::execute_config;
pub use file_to_volume::execute_file_to_volume;
pub use s3_to_volume::execute_s3_to_volume;
pub use volume_to_file::execute_volume_to_file;
pub use volume_to_s3::execute_volume_to_s3;
