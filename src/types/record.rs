#![forbid(unsafe_code)]

use std::fmt;

use serde::Serialize;

use super::Key;

/// One product-at-outlet row.
///
/// Records are immutable once built; the `with_*` methods consume and return the
/// value so a row can be assembled field by field before it is handed to a file
/// organization.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record {
    product_id: Key,
    weight: Option<f64>,
    fat_content: String,
    visibility: f64,
    product_type: String,
    mrp: f64,
    outlet_id: String,
    establishment_year: i32,
    outlet_size: Option<String>,
    location_type: String,
    outlet_type: String,
}

impl Record {
    /// Creates a record carrying the fields that make up its textual form.
    /// Remaining attributes start empty.
    pub fn new(product_id: impl Into<Key>, product_type: impl Into<String>, mrp: f64) -> Self {
        Self {
            product_id: product_id.into(),
            weight: None,
            fat_content: String::new(),
            visibility: 0.0,
            product_type: product_type.into(),
            mrp,
            outlet_id: String::new(),
            establishment_year: 0,
            outlet_size: None,
            location_type: String::new(),
            outlet_type: String::new(),
        }
    }

    /// Sets the item weight.
    pub fn with_weight(mut self, weight: Option<f64>) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the fat content label.
    pub fn with_fat_content(mut self, fat_content: impl Into<String>) -> Self {
        self.fat_content = fat_content.into();
        self
    }

    /// Sets the shelf visibility ratio.
    pub fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = visibility;
        self
    }

    /// Sets the outlet identifier.
    pub fn with_outlet_id(mut self, outlet_id: impl Into<String>) -> Self {
        self.outlet_id = outlet_id.into();
        self
    }

    /// Sets the outlet establishment year.
    pub fn with_establishment_year(mut self, year: i32) -> Self {
        self.establishment_year = year;
        self
    }

    /// Sets the outlet size label.
    pub fn with_outlet_size(mut self, outlet_size: Option<String>) -> Self {
        self.outlet_size = outlet_size;
        self
    }

    /// Sets the outlet location tier.
    pub fn with_location_type(mut self, location_type: impl Into<String>) -> Self {
        self.location_type = location_type.into();
        self
    }

    /// Sets the outlet type label.
    pub fn with_outlet_type(mut self, outlet_type: impl Into<String>) -> Self {
        self.outlet_type = outlet_type.into();
        self
    }

    /// Organizing key.
    pub fn key(&self) -> &Key {
        &self.product_id
    }

    /// Item weight, absent when the source cell was empty.
    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    /// Fat content label.
    pub fn fat_content(&self) -> &str {
        &self.fat_content
    }

    /// Shelf visibility ratio.
    pub fn visibility(&self) -> f64 {
        self.visibility
    }

    /// Product category.
    pub fn product_type(&self) -> &str {
        &self.product_type
    }

    /// Maximum retail price.
    pub fn mrp(&self) -> f64 {
        self.mrp
    }

    /// Outlet identifier.
    pub fn outlet_id(&self) -> &str {
        &self.outlet_id
    }

    /// Outlet establishment year.
    pub fn establishment_year(&self) -> i32 {
        self.establishment_year
    }

    /// Outlet size label, absent when the source cell was empty.
    pub fn outlet_size(&self) -> Option<&str> {
        self.outlet_size.as_deref()
    }

    /// Outlet location tier.
    pub fn location_type(&self) -> &str {
        &self.location_type
    }

    /// Outlet type label.
    pub fn outlet_type(&self) -> &str {
        &self.outlet_type
    }

    /// Size proxy used for block capacity accounting.
    ///
    /// This is the character count of the record's textual form, not an encoded
    /// byte length. Block fill, and therefore every block count the simulation
    /// reports, depends on it.
    pub fn size_hint(&self) -> usize {
        self.to_string().chars().count()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Record(ProductID={}, ProductType={}, MRP={})",
            self.product_id,
            self.product_type,
            DecimalDisplay(self.mrp)
        )
    }
}

/// Shortest round-trip rendering of a float.
///
/// Magnitudes in `[1e-4, 1e16)` print positionally with at least one fractional
/// digit (`250.0`). Everything else prints as mantissa, `e`, explicit sign and an
/// exponent of at least two digits (`1e+16`, `1.5e-05`).
struct DecimalDisplay(f64);

impl fmt::Display for DecimalDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v.is_nan() {
            return f.write_str("nan");
        }
        if v.is_infinite() {
            return f.write_str(if v > 0.0 { "inf" } else { "-inf" });
        }

        let sci = format!("{:e}", v.abs());
        let Some((mantissa, exp)) = sci
            .split_once('e')
            .and_then(|(m, e)| e.parse::<i32>().ok().map(|e| (m, e)))
        else {
            return write!(f, "{v:?}");
        };
        if v.is_sign_negative() {
            f.write_str("-")?;
        }

        if !(-4..16).contains(&exp) {
            let sign = if exp < 0 { '-' } else { '+' };
            return write!(f, "{mantissa}e{sign}{:02}", exp.unsigned_abs());
        }

        let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
        if exp < 0 {
            let zeros = "0".repeat((-exp - 1) as usize);
            return write!(f, "0.{zeros}{digits}");
        }
        let int_len = exp as usize + 1;
        if digits.len() <= int_len {
            let pad = "0".repeat(int_len - digits.len());
            write!(f, "{digits}{pad}.0")
        } else {
            let (int, frac) = digits.split_at(int_len);
            write!(f, "{int}.{frac}")
        }
    }
}
