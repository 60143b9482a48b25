mod local_disk;

pub use local_disk::LocalDiskImageStore;
