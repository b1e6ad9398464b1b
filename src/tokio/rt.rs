use log::warn;

#[cfg_attr(docsrs, doc(cfg(feature = "tokio-rt")))]
/// An extension for [`tokio::runtime::Builder`] to enable the Windows Runtime.
///
/// This trait is [sealed](https://rust-lang.github.io/api-guidelines/future-proofing.html).
pub trait BuilderExt: private::Sealed {
    /// Ensures that every thread spawned by the runtime joins the multithreaded apartment when
    /// started and leaves it when stopped.
    fn enable_winrt(&mut self) -> &mut Self;
}

impl BuilderExt for tokio::runtime::Builder {
    fn enable_winrt(&mut self) -> &mut Self {
        self.on_thread_start(|| {
            if let Err(err) = crate::initialize() {
                warn!("Runtime thread could not join the multithreaded apartment: {}", err);
            }
        })
        .on_thread_stop(crate::finalize)
    }
}

mod private {
    pub trait Sealed {}
    impl Sealed for tokio::runtime::Builder {}
}
