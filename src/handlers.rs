use std::io::Read;
use std::sync::Arc;

use iron::headers::ContentType;
use iron::status::{self, Status};
use iron::{AfterMiddleware, Handler, IronResult, Request, Response};
use log::debug;
use percent_encoding::percent_decode_str;
use router::Router;

use crate::model::NewPost;
use crate::store::{PostStore, StoreError};

/// Match a `Result` into its inner value or return a plain-text
/// `500 Internal Server Error`, or some other provided status and
/// message using the second variant of this macro.
macro_rules! try_handler {
    ( $e:expr ) => {
        match $e {
            Ok(x) => x,
            Err(e) => return Ok(plain_text(status::InternalServerError, &e.to_string())),
        }
    };
    ( $e:expr, $status:expr, $message:expr ) => {
        match $e {
            Ok(x) => x,
            Err(e) => {
                debug!("{}: {}", $message, e);
                return Ok(plain_text($status, $message));
            }
        }
    };
}

/// Get the `:id` parameter of the URI as a post id.
/// If it is absent or not an integer, return `400 Bad Request`.
/// If we could not obtain the parameter list, return `500 Internal Server Error`.
macro_rules! post_id {
    ( $r:expr ) => {
        match $r.extensions.get::<Router>() {
            Some(params) => match params.find("id").and_then(parse_post_id) {
                Some(id) => id,
                None => return Ok(plain_text(status::BadRequest, INVALID_ID)),
            },
            None => return Ok(plain_text(status::InternalServerError, "Missing route parameters")),
        }
    };
}

const INVALID_ID: &str = "Invalid post ID";

/// Router params are still percent-encoded, so `%31` is decoded to `1` first.
pub fn parse_post_id(raw: &str) -> Option<i64> {
    percent_decode_str(raw).decode_utf8().ok()?.parse().ok()
}

fn plain_text(status: Status, message: &str) -> Response {
    let mut res = Response::with((status, format!("{}\n", message)));
    res.headers.set(ContentType::plaintext());
    res
}

fn store_error(err: StoreError) -> Response {
    match err {
        StoreError::NotFound(_) => plain_text(status::NotFound, "Post not found"),
    }
}

pub struct Handlers {
    pub list_posts: ListPostsHandler,
    pub create_post: CreatePostHandler,
    pub post: PostHandler,
    pub delete_post: DeletePostHandler,
}

impl Handlers {
    pub fn new(store: Arc<PostStore>) -> Handlers {
        Handlers {
            list_posts: ListPostsHandler::new(store.clone()),
            create_post: CreatePostHandler::new(store.clone()),
            post: PostHandler::new(store.clone()),
            delete_post: DeletePostHandler::new(store),
        }
    }
}

pub struct ListPostsHandler {
    store: Arc<PostStore>,
}

impl ListPostsHandler {
    fn new(store: Arc<PostStore>) -> ListPostsHandler {
        ListPostsHandler { store: store }
    }
}

impl Handler for ListPostsHandler {
    fn handle(&self, _: &mut Request) -> IronResult<Response> {
        let payload = try_handler!(serde_json::to_string(&self.store.list()));
        Ok(Response::with((status::Ok, payload)))
    }
}

pub struct CreatePostHandler {
    store: Arc<PostStore>,
}

impl CreatePostHandler {
    fn new(store: Arc<PostStore>) -> CreatePostHandler {
        CreatePostHandler { store: store }
    }
}

impl Handler for CreatePostHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let mut payload = Vec::new();
        try_handler!(
            req.body.read_to_end(&mut payload),
            status::BadRequest,
            "Error reading request body"
        );

        let new_post: NewPost = try_handler!(
            serde_json::from_slice(&payload),
            status::BadRequest,
            "Error parsing request body"
        );

        let post = self.store.insert(&new_post.body);
        let payload = try_handler!(serde_json::to_string(&post));
        Ok(Response::with((status::Created, payload)))
    }
}

pub struct PostHandler {
    store: Arc<PostStore>,
}

impl PostHandler {
    fn new(store: Arc<PostStore>) -> PostHandler {
        PostHandler { store: store }
    }
}

impl Handler for PostHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let id = post_id!(req);

        match self.store.get(id) {
            Ok(post) => {
                let payload = try_handler!(serde_json::to_string(&post));
                Ok(Response::with((status::Ok, payload)))
            }
            Err(e) => Ok(store_error(e)),
        }
    }
}

pub struct DeletePostHandler {
    store: Arc<PostStore>,
}

impl DeletePostHandler {
    fn new(store: Arc<PostStore>) -> DeletePostHandler {
        DeletePostHandler { store: store }
    }
}

impl Handler for DeletePostHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let id = post_id!(req);

        match self.store.delete(id) {
            Ok(()) => Ok(Response::with(status::Ok)),
            Err(e) => Ok(store_error(e)),
        }
    }
}

/// Fallback for methods a route does not support. On item routes the id is
/// still validated first, so a bad id wins over a bad method.
pub struct MethodNotAllowedHandler {
    item: bool,
}

impl MethodNotAllowedHandler {
    pub fn collection() -> MethodNotAllowedHandler {
        MethodNotAllowedHandler { item: false }
    }

    pub fn item() -> MethodNotAllowedHandler {
        MethodNotAllowedHandler { item: true }
    }
}

impl Handler for MethodNotAllowedHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        if self.item {
            let _ = post_id!(req);
        }
        Ok(plain_text(status::MethodNotAllowed, "Method not allowed"))
    }
}

/// Item paths with no id or with extra segments (`/posts/`, `/posts/1/`).
/// Whatever the method, the id cannot be an integer.
pub struct InvalidPostIdHandler;

impl Handler for InvalidPostIdHandler {
    fn handle(&self, _: &mut Request) -> IronResult<Response> {
        Ok(plain_text(status::BadRequest, INVALID_ID))
    }
}

/// Marks every response with a body as JSON, unless the handler
/// already chose a content type.
pub struct JsonAfterMiddleware;

impl AfterMiddleware for JsonAfterMiddleware {
    fn after(&self, _: &mut Request, mut res: Response) -> IronResult<Response> {
        if res.body.is_some() && !res.headers.has::<ContentType>() {
            res.headers.set(ContentType::json());
        }
        Ok(res)
    }
}
