// Generation API: background uploads, quote posters, moodboards, downloads.
// Handlers stay thin — composition lives in render/, persistence behind
// the BlobStore capability.

pub mod handlers;
pub mod service;
