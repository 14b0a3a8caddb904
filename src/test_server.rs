use axum::{Router, extract::Path, response::Redirect};
use http::{StatusCode, header::{HeaderName, SERVER}};
use tokio::net::TcpListener;

pub const SERVER_NAME: &str = "blackscan-test";

pub const PAGES: phf::Map<&str, TestPage> = phf::phf_map! {
    "offers" => TestPage {
        code: StatusCode::OK,
        body: "Cheap loan offers, apply today",
    },
    "clean" => TestPage {
        code: StatusCode::OK,
        body: "Nothing to see here",
    },
    "promo" => TestPage {
        code: StatusCode::OK,
        body: "Casino and poker night",
    },
    "gone" => TestPage {
        code: StatusCode::GONE,
        body: "Gone",
    },
};

pub struct TestPage {
    pub code: StatusCode,
    pub body: &'static str,
}

pub fn launch() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();

    let port = listener.local_addr().unwrap().port();
    let app = make_router();

    std::thread::spawn(move || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime")
            .block_on(async {
                let listener = TcpListener::from_std(listener).unwrap();

                axum::serve(listener, app).await.unwrap();
            })
    });

    port
}

pub fn url(port: u16, page: &str) -> String {
    format!("http://127.0.0.1:{port}/{page}")
}

fn make_router() -> Router {
    use axum::routing::get;

    Router::new()
        .route("/", get(|| async { "OK" }))
        .route("/redirect", get(|| async { Redirect::temporary("/offers") }))
        .route("/{*path}", get(get_test_page))
}

async fn get_test_page(Path(path): Path<String>)
    -> (StatusCode, [(HeaderName, &'static str); 1], String)
{
    let Some(page) = PAGES.get(path.as_str()) else {
        return (StatusCode::NOT_FOUND, [(SERVER, SERVER_NAME)], "Not found".into());
    };
    (page.code, [(SERVER, SERVER_NAME)], page.body.into())
}

mod test {
    use super::*;
    use curl::easy::Easy;

    #[test]
    fn server_startup() {
        let port = launch();

        let mut easy = Easy::new();
        easy.url(&url(port, "")).unwrap();
        easy.perform().unwrap();
        assert_eq!(easy.response_code().unwrap(), 200);
        assert_eq!(easy.content_length_download().unwrap(), 2.0);

        easy.url(&url(port, "clean")).unwrap();
        easy.perform().unwrap();
        assert_eq!(easy.response_code().unwrap(), 200);
        assert_eq!(easy.content_length_download().unwrap(), 19.0);

        easy.url(&url(port, "notfound")).unwrap();
        easy.perform().unwrap();
        assert_eq!(easy.response_code().unwrap(), 404);
    }
}
