pub mod farm;
pub mod product;

use product::Category;

/// Immutable enumerations used to populate the product forms.
/// Built once at startup and handed to handlers via `Extension`.
#[derive(Debug, Clone, Copy)]
pub struct FormOptions {
    pub categories: &'static [Category],
    pub on_sale: &'static [bool],
}

impl FormOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            categories: &Category::ALL,
            on_sale: &[true, false],
        }
    }
}

impl Default for FormOptions {
    fn default() -> Self {
        Self::new()
    }
}
