mod chat;
mod health_check;
mod helpers;
mod lead;
mod order;
mod webhook;
