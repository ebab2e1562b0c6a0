mod batch_generator;

pub use batch_generator::BatchGenerator;
