/// Contains the Http client capable of executing public, multipart & Json requests, as well as
/// the parsing abstractions for responses.
pub mod http;
