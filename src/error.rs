use std::convert::From;
use std::io;

use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{Responder, Response};

pub type BotResult<T> = std::result::Result<T, BotError>;

#[derive(Debug)]
pub enum BotError {
    Reqwest(reqwest::Error),
    Io(io::Error),
    Serde(serde_json::Error),
    R2d2Timeout(diesel::r2d2::PoolError),
    DieselError(diesel::result::Error),
    Misc(Option<String>),
}

impl From<reqwest::Error> for BotError {
    fn from(e: reqwest::Error) -> Self {
        BotError::Reqwest(e)
    }
}

impl From<io::Error> for BotError {
    fn from(e: io::Error) -> Self {
        BotError::Io(e)
    }
}

impl From<serde_json::Error> for BotError {
    fn from(e: serde_json::Error) -> Self {
        BotError::Serde(e)
    }
}

impl From<diesel::r2d2::PoolError> for BotError {
    fn from(e: diesel::r2d2::PoolError) -> Self {
        BotError::R2d2Timeout(e)
    }
}

impl From<diesel::result::Error> for BotError {
    fn from(e: diesel::result::Error) -> Self {
        BotError::DieselError(e)
    }
}

impl<'r> Responder<'r> for BotError {
    fn respond_to(self, _: &Request<'_>) -> std::result::Result<Response<'r>, Status> {
        error!("Error while processing a request: {:?}", self);
        Err(Status::InternalServerError)
    }
}
