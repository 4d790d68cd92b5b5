pub mod health;
pub mod leave_request;

#[cfg(test)]
mod tests;
