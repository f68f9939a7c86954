use thiserror::Error;

pub mod attendance;
pub mod auth;
pub mod game;
pub mod payment;
pub mod player;
pub mod stats;
pub mod team;
pub mod util;

#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("game is finalized: {0}")]
    GameFinalized(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("store error: {0}")]
    Store(String),
}

impl ServiceError {
    pub fn validation<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Validation(msg.into()))
    }

    pub fn game_finalized<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::GameFinalized(msg.into()))
    }

    pub fn not_found<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::NotFound(msg.into()))
    }

    pub fn unauthorized<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Unauthorized(msg.into()))
    }

    pub fn store<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Store(msg.into()))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
