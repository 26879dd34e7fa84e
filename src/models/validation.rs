use rust_decimal::Decimal;

use super::price::{normalize_price, MAX_STORED_PRICE};
use super::{
    CreateDishRequest, CreateMenuRequest, CreateSubmenuRequest, UpdateDishRequest,
    UpdateMenuRequest, UpdateSubmenuRequest, ValidationError, ValidationResult,
};

/// Trait for validating input models
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

impl Validate for CreateMenuRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_title(&self.title)?;
        validate_description(&self.description)
    }
}

impl Validate for UpdateMenuRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_optional_fields(self.title.as_deref(), self.description.as_deref())
    }
}

impl Validate for CreateSubmenuRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_title(&self.title)?;
        validate_description(&self.description)
    }
}

impl Validate for UpdateSubmenuRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_optional_fields(self.title.as_deref(), self.description.as_deref())
    }
}

impl Validate for CreateDishRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_title(&self.title)?;
        validate_description(&self.description)?;
        validate_price(&self.price)
    }
}

impl Validate for UpdateDishRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_optional_fields(self.title.as_deref(), self.description.as_deref())?;
        if let Some(price) = &self.price {
            validate_price(price)?;
        }
        Ok(())
    }
}

fn validate_optional_fields(title: Option<&str>, description: Option<&str>) -> ValidationResult<()> {
    if let Some(title) = title {
        validate_title(title)?;
    }
    if let Some(description) = description {
        validate_description(description)?;
    }
    Ok(())
}

/// Titles must be non-blank and bounded
pub fn validate_title(title: &str) -> ValidationResult<()> {
    if title.trim().is_empty() {
        return Err(ValidationError::RequiredField {
            field: "title".to_string(),
        });
    }

    let length = title.chars().count();
    if length > MAX_TITLE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max_length: MAX_TITLE_LENGTH,
            actual_length: length,
        });
    }

    Ok(())
}

pub fn validate_description(description: &str) -> ValidationResult<()> {
    let length = description.chars().count();
    if length > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max_length: MAX_DESCRIPTION_LENGTH,
            actual_length: length,
        });
    }
    Ok(())
}

/// Prices are non-negative and must still fit a NUMERIC(10,4) column once
/// rounded to storage precision
pub fn validate_price(price: &Decimal) -> ValidationResult<()> {
    if *price < Decimal::ZERO || normalize_price(*price) >= MAX_STORED_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: "0".to_string(),
            max: MAX_STORED_PRICE.to_string(),
            value: price.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_title_validation() {
        assert!(validate_title("First menu").is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"a".repeat(MAX_TITLE_LENGTH)).is_ok());
        assert!(validate_title(&"a".repeat(MAX_TITLE_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_empty_description_allowed() {
        assert!(validate_description("").is_ok());
        assert!(validate_description(&"d".repeat(MAX_DESCRIPTION_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_price_validation() {
        assert!(validate_price(&dec!(0)).is_ok());
        assert!(validate_price(&dec!(123.456)).is_ok());
        assert!(validate_price(&dec!(999999.9999)).is_ok());
        assert!(validate_price(&dec!(1000000)).is_err());
        assert!(validate_price(&dec!(-0.01)).is_err());
    }

    #[test]
    fn test_price_rounding_up_to_bound_rejected() {
        assert!(validate_price(&dec!(999999.99994)).is_ok());
        assert!(validate_price(&dec!(999999.99995)).is_err());

        let request = UpdateDishRequest {
            price: Some(dec!(999999.99999)),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_request_validation() {
        let empty = UpdateDishRequest::default();
        assert!(empty.validate().is_ok());

        let blank_title = UpdateMenuRequest {
            title: Some("".to_string()),
            ..Default::default()
        };
        assert!(blank_title.validate().is_err());

        let negative_price = UpdateDishRequest {
            price: Some(dec!(-1)),
            ..Default::default()
        };
        assert!(negative_price.validate().is_err());
    }
}
