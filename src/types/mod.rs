// src/types/mod.rs
pub mod job_post;
pub mod response;
pub mod timestamp;

pub use job_post::{JobPost, JobPostUpdate, NewJobPost, User};
pub use response::{
    ErrorResponse, LinkedInPostRequest, LinkedInPostResponse, MessageResponse, RefineResponse,
};
