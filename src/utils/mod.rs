pub mod hash;
pub mod html;
pub mod jwt;
pub mod response;
pub mod retry;
pub mod sql;
