mod canonicalized_dir_buf;

pub use canonicalized_dir_buf::CanonicalizedDirBuf;
