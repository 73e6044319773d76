mod gaussian_blobs;

pub use gaussian_blobs::GaussianBlobGenerator;
