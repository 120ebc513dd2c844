mod helpers;
mod mocks;

mod accounts;
mod admin;
mod cart;
mod catalog;
