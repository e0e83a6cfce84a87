//! Rate-controlled frame sampling for video clips.
//!
//! The core decides which frames of a clip to sample, how many to keep and
//! what size to emit them at. Decoding, resampling, downloading and audio
//! extraction sit behind the traits in the `domain` modules; ffmpeg- and
//! `image`-backed adapters live in the matching `infrastructure` modules.

pub mod shared {
    pub mod constants;
    pub mod error;
    pub mod frame;
    pub mod frame_batch;
    pub mod video_metadata;
}

pub mod sampling {
    pub mod domain {
        pub mod frame_acquirer;
        pub mod frame_conversion;
        pub mod sampling_plan;
        pub mod sampling_request;
    }
}

pub mod sizing {
    pub mod domain {
        pub mod resampler;
        pub mod resize_stage;
        pub mod size_spec;
    }
    pub mod infrastructure {
        pub mod image_resampler;
    }
}

pub mod video {
    pub mod domain {
        pub mod audio_extractor;
        pub mod frame_source;
        pub mod image_writer;
        pub mod video_downloader;
        pub mod video_source;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod load_video_use_case;
    pub mod pipeline_logger;
}
