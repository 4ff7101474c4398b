mod backstop;
mod closure;
