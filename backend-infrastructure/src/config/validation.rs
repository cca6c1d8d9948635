use anyhow::{anyhow, Result};

pub fn validate_bind_addr(value: &str) -> Result<()> {
    value
        .parse::<std::net::SocketAddr>()
        .map_err(|err| anyhow!("invalid bind_addr '{}': {}", value, err))?;
    Ok(())
}

pub fn validate_non_zero(name: &str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(anyhow!("{} must be greater than 0", name));
    }
    Ok(())
}

pub fn validate_path(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(anyhow!("{} must not be empty", name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_must_be_socket_addr() {
        assert!(validate_bind_addr("0.0.0.0:8000").is_ok());
        assert!(validate_bind_addr("localhost").is_err());
    }

    #[test]
    fn zero_and_blank_values_are_rejected() {
        assert!(validate_non_zero("max_batch_size", 0).is_err());
        assert!(validate_non_zero("max_batch_size", 1).is_ok());
        assert!(validate_path("model_path", "  ").is_err());
    }
}
