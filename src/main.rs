#[actix_web::main]
async fn main() -> std::io::Result<()> {
    ewaybill_server::run().await
}
