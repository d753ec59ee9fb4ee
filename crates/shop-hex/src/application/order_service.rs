use crate::errors::AppError;
use shop_types::domain::order::{NewItem, NewOrder, Order};
use shop_types::ports::repository::OrderRepository;
use uuid::Uuid;

pub struct OrderService<R: OrderRepository> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn create_order(
        &self,
        customer_id: String,
        items: Vec<NewItem>,
    ) -> Result<Order, AppError> {
        let draft =
            NewOrder::new(customer_id, items).map_err(|e| AppError::BadRequest(e.to_string()))?;
        let order = self.repo.save(draft).await?;
        tracing::info!(order_id = %order.id, items = order.items.len(), "order created");
        Ok(order)
    }

    pub async fn get_order(&self, id: Uuid) -> Result<Order, AppError> {
        Ok(self.repo.find_by_id(id).await?)
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, AppError> {
        Ok(self.repo.list_all().await?)
    }
}
