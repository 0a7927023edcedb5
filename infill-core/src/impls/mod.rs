mod impls_core;
mod impls_alloc;
