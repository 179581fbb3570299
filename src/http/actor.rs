use actix_web::{http::header, web, FromRequest};
use futures::future::{ready, LocalBoxFuture};
use thiserror::Error as ThisError;

use super::{Error, Session};
use crate::{models::User, types, App};

/// Who is making the request. Session verification failures resolve to
/// [`Actor::Anonymous`] so routes with optional auth keep working; the
/// user-only paths escalate through [`Actor::get_user`].
#[derive(Debug)]
pub enum Actor {
    Anonymous,
    User(User),
}

impl Actor {
    pub fn get_user(self) -> Result<User, Error> {
        #[derive(Debug, ThisError)]
        #[error("attempt to access a user-only route without a session")]
        struct Unauthenticated;

        match self {
            Self::User(user) => Ok(user),
            Self::Anonymous => Err(Error::from_context(
                types::Error::Unauthorized,
                Unauthenticated,
            )),
        }
    }
}

impl FromRequest for Actor {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string);

        let Some(token) = token else {
            return Box::pin(ready(Ok(Actor::Anonymous)));
        };

        let Some(app) = req.app_data::<web::Data<App>>() else {
            #[derive(Debug, ThisError)]
            #[error("the web app has no available configuration")]
            struct NoAppData;

            return Box::pin(ready(Err(Error::from_context(
                types::Error::Internal,
                NoAppData,
            ))));
        };

        let app = app.clone();
        Box::pin(async move {
            let Ok(session) = Session::verify(&app.config.auth, &token) else {
                return Ok(Actor::Anonymous);
            };

            let mut conn = app.db_read_prefer_primary().await?;
            if let Some(user) = User::by_id(&mut conn, session.sub).await? {
                Ok(Actor::User(user))
            } else {
                Ok(Actor::Anonymous)
            }
        })
    }
}
