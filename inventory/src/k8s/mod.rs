mod contexts;

pub use contexts::KubeContexts;
