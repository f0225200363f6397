use std::process;
use std::sync::Arc;

use iron::Iron;
use log::{error, info};
use logger::Logger;

use posts_backend::store::PostStore;
use posts_backend::{chain, LISTEN_ADDR};

// RUST_LOG=info,logger=info posts > logs 2>&1 &
fn main() {
    env_logger::init();
    let (logger_before, logger_after) = Logger::new(None);

    let store = Arc::new(PostStore::new());

    let mut chain = chain(store.clone());
    chain.link_before(logger_before); // Only before-middleware, so it is first.
    chain.link_after(logger_after); // Should be last!

    match Iron::new(chain).http(LISTEN_ADDR) {
        // Dropping the listening guard joins the server threads.
        Ok(_listening) => info!(
            "server is running at http://{} with {} posts",
            LISTEN_ADDR,
            store.len()
        ),
        Err(e) => {
            error!("could not bind {}: {}", LISTEN_ADDR, e);
            process::exit(1);
        }
    }
}
