//! Opaque host handles.
//!
//! The host hands out pointer-sized identities for windows, modules, icons,
//! menus and monitors. They are carried as plain integers so the state record
//! stays platform-neutral; zero means "no handle".

macro_rules! host_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(pub isize);

        impl $name {
            pub const NULL: Self = Self(0);

            pub fn is_null(self) -> bool {
                self.0 == 0
            }

            /// `None` for the null handle.
            pub fn non_null(self) -> Option<Self> {
                if self.is_null() { None } else { Some(self) }
            }
        }
    };
}

host_handle!(
    /// Hidden message window owning the icon.
    WindowHandle
);
host_handle!(
    /// Module (instance) the window class is registered with.
    ModuleHandle
);
host_handle!(
    /// Icon image shown in the notification area or in a balloon.
    IconHandle
);
host_handle!(
    /// Context menu; its first sub-menu is what gets shown.
    MenuHandle
);
host_handle!(
    /// Display monitor.
    MonitorHandle
);
