use actix_web::http::StatusCode;
use actix_web::ResponseError;
use cord19::Cord19Error;

pub(crate) type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Debug, thiserror::Error)]
pub(crate) enum DashboardError {
    #[error(transparent)]
    Cord19(#[from] Cord19Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl ResponseError for DashboardError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Cord19(Cord19Error::MissingDataFile(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
