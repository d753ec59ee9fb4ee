use crate::errors::AppError;
use shop_types::domain::customer::{Customer, NewAddress, NewCustomer};
use shop_types::ports::repository::CustomerRepository;
use uuid::Uuid;

pub struct CustomerService<R: CustomerRepository> {
    repo: R,
}

impl<R: CustomerRepository> CustomerService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn create_customer(
        &self,
        name: String,
        email: String,
        addresses: Vec<NewAddress>,
    ) -> Result<Customer, AppError> {
        let draft = NewCustomer::new(name, email, addresses)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        let customer = self.repo.save(draft).await?;
        tracing::info!(
            customer_id = %customer.id,
            addresses = customer.addresses.len(),
            "customer created"
        );
        Ok(customer)
    }

    pub async fn get_customer(&self, id: Uuid) -> Result<Customer, AppError> {
        Ok(self.repo.find_by_id(id).await?)
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
        Ok(self.repo.list_all().await?)
    }
}
