//! Declarative macros for reducing boilerplate in asset category definitions.
//!
//! The `zakat_category!` macro generates a struct whose fields are all
//! monetary amounts, together with a `new()` constructor, one lenient setter
//! per field and a saturating `sum()`.

/// Generates a category struct of `Decimal` amounts.
///
/// # Usage
///
/// ```rust,ignore
/// zakat_category! {
///     /// Documentation for the struct
///     pub struct MyAssets {
///         /// Documentation for the field
///         first_amount,
///         second_amount,
///     }
/// }
/// ```
///
/// Setters accept anything implementing `IntoZakatDecimal`; a value that
/// cannot be converted is stored as zero, matching the request sanitizer.
/// The `ZakatableAsset` impl is still written by hand.
macro_rules! zakat_category {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field: rust_decimal::Decimal,
            )+
        }

        impl $name {
            /// Creates a new instance with every amount at zero.
            pub fn new() -> Self {
                Self::default()
            }

            $(
                #[doc = concat!("Sets `", stringify!($field), "`. Unconvertible input is stored as zero.")]
                pub fn $field(mut self, val: impl $crate::inputs::IntoZakatDecimal) -> Self {
                    self.$field = val.into_zakat_decimal().unwrap_or(rust_decimal::Decimal::ZERO);
                    self
                }
            )+

            /// Sum of every amount, saturating at the `Decimal` range.
            pub fn sum(&self) -> rust_decimal::Decimal {
                rust_decimal::Decimal::ZERO $( .saturating_add(self.$field) )+
            }
        }
    };
}
