use feira_core::ItemPatch;

/// Raw text collected for a new item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemForm {
    pub name: String,
    pub quantity: String,
    pub unit_price: String,
}

impl ItemForm {
    pub fn new(
        name: impl Into<String>,
        quantity: impl Into<String>,
        unit_price: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            unit_price: unit_price.into(),
        }
    }

    /// Validates that the form has all required values for submission.
    ///
    /// Only emptiness is checked; numeric text is coerced later, so
    /// `"abc"` is accepted and becomes zero.
    pub fn validate_for_submit(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Item name is required.".to_string());
        }

        if self.quantity.trim().is_empty() {
            errors.push("Quantity is required.".to_string());
        }

        if self.unit_price.trim().is_empty() {
            errors.push("Unit price is required.".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Fields supplied to an edit. `None` leaves the field untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemEditForm {
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub unit_price: Option<String>,
}

impl ItemEditForm {
    /// Builds the patch to apply.
    ///
    /// Rules:
    /// - at least one field must be supplied
    /// - a supplied field must not be blank
    pub fn to_patch(&self) -> Result<ItemPatch, Vec<String>> {
        let mut errors = Vec::new();

        if self.name.is_none() && self.quantity.is_none() && self.unit_price.is_none() {
            errors.push("Nothing to change: give a name, quantity or unit price.".to_string());
        }

        let supplied = [
            (&self.name, "Item name"),
            (&self.quantity, "Quantity"),
            (&self.unit_price, "Unit price"),
        ];
        for (value, label) in supplied {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                errors.push(format!("{label} cannot be blank."));
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let mut patch = ItemPatch::new();
        if let Some(name) = &self.name {
            patch = patch.name(name.clone());
        }
        if let Some(quantity) = &self.quantity {
            patch = patch.quantity_text(quantity);
        }
        if let Some(unit_price) = &self.unit_price {
            patch = patch.unit_price_text(unit_price);
        }
        Ok(patch)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn complete_form_is_valid() {
        assert_eq!(ItemForm::new("Rice", "2", "5,50").validate_for_submit(), Ok(()));
    }

    #[test]
    fn blank_fields_are_all_reported() {
        let errors = ItemForm::new("  ", "", "").validate_for_submit().unwrap_err();

        assert_eq!(
            errors,
            vec![
                "Item name is required.".to_string(),
                "Quantity is required.".to_string(),
                "Unit price is required.".to_string(),
            ]
        );
    }

    #[test]
    fn non_numeric_text_passes_validation() {
        assert!(ItemForm::new("Rice", "abc", "x").validate_for_submit().is_ok());
    }

    #[test]
    fn empty_edit_is_rejected() {
        let errors = ItemEditForm::default().to_patch().unwrap_err();

        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn blank_edit_field_is_rejected() {
        let form = ItemEditForm {
            quantity: Some(" ".to_string()),
            ..Default::default()
        };

        assert_eq!(
            form.to_patch().unwrap_err(),
            vec!["Quantity cannot be blank.".to_string()]
        );
    }

    #[test]
    fn edit_builds_coerced_patch() {
        let form = ItemEditForm {
            name: Some("Beans".to_string()),
            unit_price: Some("7,25".to_string()),
            ..Default::default()
        };

        let patch = form.to_patch().unwrap();

        assert_eq!(
            patch,
            ItemPatch::new().name("Beans").unit_price(dec!(7.25))
        );
    }
}
