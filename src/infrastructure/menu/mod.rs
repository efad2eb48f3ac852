mod static_menu_source;

pub use static_menu_source::StaticMenuSource;
