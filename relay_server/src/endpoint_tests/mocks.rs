use mockall::mock;
use relay_engine::{Order, OrderId, OrderSource, OrderSourceError};

mock! {
    pub OrderSource {}
    impl OrderSource for OrderSource {
        async fn list_recent(&self, page_size: u32) -> Result<Vec<Order>, OrderSourceError>;
        async fn fetch_by_id(&self, order_id: &OrderId) -> Result<Order, OrderSourceError>;
    }
}
