mod common;
mod feed;
mod ranking;
