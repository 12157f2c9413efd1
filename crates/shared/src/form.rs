use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    domain::ClientRecord,
    error::{StoreError, StoreResult},
};

/// The four recognised form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Phone,
    Address,
}

impl FormField {
    pub const ALL: [FormField; 4] = [Self::Name, Self::Email, Self::Phone, Self::Address];

    /// Key used by the dashboard form markup.
    pub fn form_key(self) -> &'static str {
        match self {
            Self::Name => "nombre",
            Self::Email => "email",
            Self::Phone => "telefono",
            Self::Address => "direccion",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, Self::Name | Self::Email)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field '{0}'")]
pub struct UnknownFormField(pub String);

impl FromStr for FormField {
    type Err = UnknownFormField;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "nombre" | "name" => Ok(Self::Name),
            "email" | "correo" => Ok(Self::Email),
            "telefono" | "phone" => Ok(Self::Phone),
            "direccion" | "address" => Ok(Self::Address),
            _ => Err(UnknownFormField(raw.to_string())),
        }
    }
}

/// Flat field set passed across the persistence boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientFields {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl ClientFields {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
            address: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Trims every value and turns blank optional values into `None`.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: non_blank(self.phone),
            address: non_blank(self.address),
        }
    }

    /// Fails on the first missing required field, name before email.
    pub fn validate(&self) -> StoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(StoreError::Validation {
                field: FormField::Name.label(),
            });
        }
        if self.email.trim().is_empty() {
            return Err(StoreError::Validation {
                field: FormField::Email.label(),
            });
        }
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Raw text currently typed into the create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientForm {
    name: String,
    email: String,
    phone: String,
    address: String,
}

impl ClientForm {
    pub fn from_record(record: &ClientRecord) -> Self {
        Self {
            name: record.name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone().unwrap_or_default(),
            address: record.address.clone().unwrap_or_default(),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
            FormField::Address => &self.address,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Phone => &mut self.phone,
            FormField::Address => &mut self.address,
        };
        *slot = value.into();
    }

    pub fn is_blank(&self) -> bool {
        FormField::ALL.iter().all(|f| self.get(*f).trim().is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Builds the validated boundary value without consuming the form.
    pub fn to_fields(&self) -> StoreResult<ClientFields> {
        let fields = ClientFields {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: Some(self.phone.clone()),
            address: Some(self.address.clone()),
        }
        .normalized();
        fields.validate()?;
        Ok(fields)
    }
}
