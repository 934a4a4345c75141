#[tokio::main]
async fn main() {
    customer_registration_lib::run().await
}
