use crate::utils::error::Result;

/// Byte-level access to the flat files, addressed relative to a backend root.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
    fn exists(&self, path: &str) -> bool;
}

pub trait ConfigProvider: Send + Sync {
    fn data_dir(&self) -> &str;
    fn members_file(&self) -> &str;
    fn classes_file(&self) -> &str;
    fn enrollments_file(&self) -> &str;
}
