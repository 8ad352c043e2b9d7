mod service;
mod session;
mod util;
