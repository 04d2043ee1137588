use polars::prelude::DataFrame;

/// Typed wrappers separating cleaned tables from raw string tables.
///
/// Each wrapper can only be constructed by its cleaning function, so the
/// aggregation stage cannot be handed a table whose currency and numeric
/// columns are still raw strings.
macro_rules! clean_table {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name(DataFrame);

        impl $name {
            pub(crate) fn new(df: DataFrame) -> Self {
                Self(df)
            }

            pub fn frame(&self) -> &DataFrame {
                &self.0
            }

            pub fn into_frame(self) -> DataFrame {
                self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.height() == 0
            }
        }
    };
}

clean_table! {
    /// Order lines after status filtering, keyword exclusion, typed
    /// numeric columns and derived fee/revenue columns.
    CleanOrders
}

clean_table! {
    /// Ad campaigns with typed metrics and recomputed ROAS/ACOS.
    CleanAds
}

clean_table! {
    /// Daily live-stream overview rows, durations in seconds and hours.
    CleanLive
}

clean_table! {
    /// Daily video overview rows with typed engagement metrics.
    CleanVideo
}

clean_table! {
    /// Short-video live sessions with typed metrics.
    CleanShortVideoLive
}

clean_table! {
    /// Short-video per-video records with typed metrics and engagement rate.
    CleanShortVideoVideo
}
