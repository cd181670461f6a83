use std::{convert::Infallible, net::SocketAddr, path::PathBuf};

use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql_warp::{GraphQLBadRequest, GraphQLResponse};
use tracing::info;
use warp::{http::StatusCode, reply::Reply, Filter, Rejection};

use crate::api::Schema;

pub(crate) struct Tls {
    pub(crate) cert: PathBuf,
    pub(crate) key: PathBuf,
}

/// Routes: GraphQL playground at `GET /`, queries at `POST /graphql`.
pub(crate) fn routes(
    schema: Schema,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let graphql_post = warp::path("graphql")
        .and(warp::path::end())
        .and(async_graphql_warp::graphql(schema))
        .and_then(
            |(schema, request): (Schema, async_graphql::Request)| async move {
                Ok::<_, Infallible>(GraphQLResponse::from(schema.execute(request).await))
            },
        );

    let playground = warp::path::end().and(warp::get()).map(|| {
        warp::reply::html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
    });

    playground.or(graphql_post).recover(handle_rejection)
}

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    if let Some(GraphQLBadRequest(err)) = err.find() {
        return Ok(warp::reply::with_status(
            err.to_string(),
            StatusCode::BAD_REQUEST,
        ));
    }
    if err.is_not_found() {
        return Ok(warp::reply::with_status(
            "NOT_FOUND".to_string(),
            StatusCode::NOT_FOUND,
        ));
    }
    Ok(warp::reply::with_status(
        "INTERNAL_SERVER_ERROR".to_string(),
        StatusCode::INTERNAL_SERVER_ERROR,
    ))
}

pub(crate) async fn serve(schema: Schema, addr: SocketAddr, tls: Option<Tls>) {
    let filter = routes(schema);
    match tls {
        Some(tls) => {
            info!("listening on https://{addr}");
            warp::serve(filter)
                .tls()
                .cert_path(tls.cert)
                .key_path(tls.key)
                .run(addr)
                .await;
        }
        None => {
            info!("listening on http://{addr}");
            warp::serve(filter).run(addr).await;
        }
    }
}
