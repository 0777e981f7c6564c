pub mod theme_sink;
