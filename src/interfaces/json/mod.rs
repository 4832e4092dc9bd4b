pub mod request_reader;
pub mod response;
pub mod response_writer;
