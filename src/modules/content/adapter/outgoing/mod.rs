pub mod css_variables;
