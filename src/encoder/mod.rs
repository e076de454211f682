pub mod backend;
pub mod synthetic;

pub use backend::{
    EncoderEvent, EncoderEventKind, EncoderEvents, EncoderFactory, EncoderState, MediaEncoder,
    MediaType,
};
pub use synthetic::{SyntheticEncoderConfig, SyntheticEncoderFactory};
