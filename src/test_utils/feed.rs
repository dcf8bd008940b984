use axum::{Router, http::StatusCode, routing::get};

/// A product feed with one record using `sold` and one using `isSold`.
pub(crate) const FEED: &str = r#"[
    {
        "id": 1,
        "title": "Fjallraven  Foldsack No 1 Backpack",
        "price": 329.85,
        "description": "Your perfect pack for everyday use",
        "category": "men's clothing",
        "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
        "sold": false,
        "dateOfSale": "2021-11-27T20:29:54+05:30"
    },
    {
        "id": 2,
        "title": "Mens Casual Premium Slim Fit T-Shirts",
        "price": 44.6,
        "description": "Slim-fitting style",
        "category": "men's clothing",
        "isSold": true,
        "dateOfSale": "2021-10-27T20:29:54+05:30"
    }
]"#;

/// Serve `body` with `status` on a local port and return the feed URL.
pub(crate) async fn serve_feed(status: StatusCode, body: &'static str) -> String {
    let app = Router::new().route("/feed.json", get(move || async move { (status, body) }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    format!("http://{address}/feed.json")
}
