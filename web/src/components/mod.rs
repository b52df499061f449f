//! Reusable view components shared by pages.

pub mod item_card;
pub mod nav_bar;
pub mod notice_bar;
