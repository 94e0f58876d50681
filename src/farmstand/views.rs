//! Thin server-side HTML rendering.
//!
//! Pages are assembled with plain string building; user-supplied fields are
//! escaped before they reach the markup. Rendering never fails, so these
//! helpers return `Html` directly and handlers stay focused on storage.

use crate::farmstand::models::{
    farm::Farm,
    product::{Category, Product},
    FormOptions,
};
use axum::response::Html;
use std::fmt::Write;

/// Escape user-supplied text for safe interpolation into markup.
#[must_use]
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} | Farm Stand</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape(title),
    ))
}

pub fn farms_index(farms: &[Farm]) -> Html<String> {
    let mut body = String::from("<h1>All Farms</h1>\n<ul>\n");
    for farm in farms {
        let _ = writeln!(
            body,
            "<li><a href=\"/farms/{id}\">{name}</a></li>",
            id = farm.id,
            name = escape(&farm.name),
        );
    }
    body.push_str("</ul>\n<a href=\"/farms/new\">Add Farm</a>");

    layout("Farms", &body)
}

pub fn farm_new() -> Html<String> {
    let body = "<h1>Add A Farm</h1>\n\
        <form action=\"/farms\" method=\"POST\">\n\
        <label for=\"name\">Farm Name</label>\n\
        <input type=\"text\" name=\"name\" id=\"name\">\n\
        <label for=\"city\">City</label>\n\
        <input type=\"text\" name=\"city\" id=\"city\">\n\
        <label for=\"email\">Email</label>\n\
        <input type=\"email\" name=\"email\" id=\"email\">\n\
        <button>Create Farm</button>\n\
        </form>";

    layout("New Farm", body)
}

pub fn farm_detail(farm: &Farm, products: &[Product]) -> Html<String> {
    let mut body = format!("<h1>{}</h1>\n<ul>\n", escape(&farm.name));

    if let Some(city) = &farm.city {
        let _ = writeln!(body, "<li>City: {}</li>", escape(city));
    }
    let _ = writeln!(body, "<li>Email: {}</li>", escape(&farm.email));
    body.push_str("</ul>\n<h2>Products</h2>\n<ul>\n");
    for product in products {
        let _ = writeln!(
            body,
            "<li><a href=\"/products/{id}\">{name}</a></li>",
            id = product.id,
            name = escape(&product.name),
        );
    }
    let _ = write!(
        body,
        "</ul>\n<a href=\"/farms/{id}/products/new\">Add Product</a>\n\
         <form action=\"/farms/{id}?_method=DELETE\" method=\"POST\">\n\
         <button>Delete Farm</button>\n\
         </form>\n\
         <a href=\"/farms\">All Farms</a>",
        id = farm.id,
    );

    layout(&farm.name, &body)
}

fn category_options(options: FormOptions, selected: Option<Category>) -> String {
    let mut markup = String::from("<option value=\"\">none</option>\n");
    for category in options.categories {
        let _ = writeln!(
            markup,
            "<option value=\"{category}\"{sel}>{category}</option>",
            sel = if selected == Some(*category) {
                " selected"
            } else {
                ""
            },
        );
    }
    markup
}

fn on_sale_options(options: FormOptions, selected: bool) -> String {
    let mut markup = String::new();
    for value in options.on_sale {
        let _ = writeln!(
            markup,
            "<option value=\"{value}\"{sel}>{value}</option>",
            sel = if *value == selected { " selected" } else { "" },
        );
    }
    markup
}

fn product_fields(options: FormOptions, product: Option<&Product>) -> String {
    let name = product.map_or(String::new(), |p| escape(&p.name));
    let price = product.map_or(String::new(), |p| p.price.to_string());
    let qty = product.map_or_else(|| "1".to_string(), |p| p.qty.to_string());

    format!(
        "<label for=\"name\">Product Name</label>\n\
         <input type=\"text\" name=\"name\" id=\"name\" value=\"{name}\">\n\
         <label for=\"price\">Price</label>\n\
         <input type=\"text\" name=\"price\" id=\"price\" value=\"{price}\">\n\
         <label for=\"qty\">Qty</label>\n\
         <input type=\"text\" name=\"qty\" id=\"qty\" value=\"{qty}\">\n\
         <label for=\"category\">Category</label>\n\
         <select name=\"category\" id=\"category\">\n{categories}</select>\n\
         <label for=\"on_sale\">On Sale</label>\n\
         <select name=\"on_sale\" id=\"on_sale\">\n{on_sale}</select>\n",
        categories = category_options(options, product.and_then(|p| p.category)),
        on_sale = on_sale_options(options, product.is_some_and(|p| p.on_sale)),
    )
}

pub fn product_new(options: FormOptions) -> Html<String> {
    let body = format!(
        "<h1>Add A Product</h1>\n\
         <form action=\"/products\" method=\"POST\">\n{fields}\
         <button>Create Product</button>\n\
         </form>",
        fields = product_fields(options, None),
    );

    layout("New Product", &body)
}

pub fn farm_product_new(farm: &Farm, options: FormOptions) -> Html<String> {
    let body = format!(
        "<h1>Add A Product For {name}</h1>\n\
         <form action=\"/farms/{id}/products\" method=\"POST\">\n{fields}\
         <button>Create Product</button>\n\
         </form>",
        name = escape(&farm.name),
        id = farm.id,
        fields = product_fields(options, None),
    );

    layout("New Product", &body)
}

pub fn product_edit(product: &Product, options: FormOptions) -> Html<String> {
    let body = format!(
        "<h1>Edit {name}</h1>\n\
         <form action=\"/products/{id}?_method=PUT\" method=\"POST\">\n{fields}\
         <button>Update Product</button>\n\
         </form>\n\
         <a href=\"/products/{id}\">Cancel</a>",
        name = escape(&product.name),
        id = product.id,
        fields = product_fields(options, Some(product)),
    );

    layout("Edit Product", &body)
}

pub fn products_index(products: &[Product], category: &str) -> Html<String> {
    let mut body = format!("<h1>{} Products</h1>\n<ul>\n", escape(category));
    for product in products {
        let _ = writeln!(
            body,
            "<li><a href=\"/products/{id}\">{name}</a></li>",
            id = product.id,
            name = escape(&product.name),
        );
    }
    body.push_str("</ul>\n<a href=\"/products/new\">Add Product</a>");

    layout("Products", &body)
}

pub fn product_detail(product: &Product) -> Html<String> {
    let mut body = format!("<h1>{}</h1>\n<ul>\n", escape(&product.name));

    let _ = writeln!(body, "<li>Price: {}</li>", product.price);
    let _ = writeln!(
        body,
        "<li>Category: {}</li>",
        product.category.map_or("none", Category::as_str),
    );
    let _ = writeln!(body, "<li>On sale: {}</li>", product.on_sale);
    let _ = writeln!(body, "<li>Qty: {}</li>", product.qty);
    let _ = write!(
        body,
        "</ul>\n<a href=\"/products/{id}/edit\">Edit</a>\n\
         <form action=\"/products/{id}?_method=DELETE\" method=\"POST\">\n\
         <button>Delete</button>\n\
         </form>\n\
         <a href=\"/products\">All Products</a>",
        id = product.id,
    );

    layout(&product.name, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn product() -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "milk & honey <raw>".to_string(),
            price: 500.0,
            category: Some(Category::Drink),
            on_sale: true,
            qty: 5,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"a" & 'b'</b>"#),
            "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_products_index_escapes_names() {
        let Html(page) = products_index(&[product()], "All");

        assert!(page.contains("milk &amp; honey &lt;raw&gt;"));
        assert!(!page.contains("<raw>"));
    }

    #[test]
    fn test_product_edit_preselects_fields() {
        let product = product();
        let Html(page) = product_edit(&product, FormOptions::new());

        assert!(page.contains("<option value=\"drink\" selected>drink</option>"));
        assert!(page.contains("<option value=\"true\" selected>true</option>"));
        assert!(page.contains(&format!("/products/{}?_method=PUT", product.id)));
    }

    #[test]
    fn test_farm_detail_links_products() {
        let farm = Farm {
            id: Uuid::new_v4(),
            name: "Green Acres".to_string(),
            city: None,
            email: "green@acres.farm".to_string(),
            product_ids: vec![],
        };
        let Html(page) = farm_detail(&farm, &[product()]);

        assert!(page.contains("Green Acres"));
        assert!(page.contains(&format!("/farms/{}?_method=DELETE", farm.id)));
        assert!(page.contains("milk &amp; honey"));
    }
}
