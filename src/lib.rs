pub mod handlers;
pub mod model;
pub mod store;

use std::sync::Arc;

use iron::prelude::Chain;
use router::Router;

use crate::handlers::*;
use crate::store::PostStore;

pub const LISTEN_ADDR: &str = "localhost:8081";

/// Routes for the posts resource. Methods without a handler of their own fall
/// through to the `any` routes and get `405 Method Not Allowed`.
pub fn router(store: Arc<PostStore>) -> Router {
    let handlers = Handlers::new(store);

    let mut router = Router::new();
    router.get("/posts", handlers.list_posts, "list_posts");
    router.post("/posts", handlers.create_post, "create_post");
    router.any("/posts", MethodNotAllowedHandler::collection(), "posts_not_allowed");
    router.get("/posts/:id", handlers.post, "post");
    router.delete("/posts/:id", handlers.delete_post, "delete_post");
    router.any("/posts/:id", MethodNotAllowedHandler::item(), "post_not_allowed");
    // Without these the router answers a trailing slash with a redirect.
    router.any("/posts/", InvalidPostIdHandler, "post_missing_id");
    router.any("/posts/*rest", InvalidPostIdHandler, "post_extra_segments");
    router
}

/// The application without request logging, which `main` links around it.
pub fn chain(store: Arc<PostStore>) -> Chain {
    let mut chain = Chain::new(router(store));
    chain.link_after(JsonAfterMiddleware);
    chain
}
