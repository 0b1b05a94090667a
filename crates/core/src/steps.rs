//! Provisioning step table.
//!
//! The schema is applied as an ordered list of named SQL steps. Order is
//! load-bearing: a table must exist before its indexes and policies, a
//! function before the trigger that calls it, and row-level security must be
//! enabled before policies are created. Each step commits on its own
//! (autocommit), so low-risk operations come first.

/// A single named provisioning step. Immutable, defined at build time.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub name: &'static str,
    pub sql: &'static str,
}

/// The fixed forward step sequence. A step may carry several statements in
/// one SQL text; they execute as one batch.
pub const EXECUTION_STEPS: &[Step] = &[
    Step {
        name: "Enable UUID Extension",
        sql: r#"CREATE EXTENSION IF NOT EXISTS "uuid-ossp";"#,
    },
    Step {
        name: "Create Waitlist Table",
        sql: r#"
            CREATE TABLE waitlist (
                id UUID DEFAULT uuid_generate_v4() PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                created_at TIMESTAMP WITH TIME ZONE DEFAULT TIMEZONE('utc', NOW()) NOT NULL,
                position INTEGER NOT NULL,
                status TEXT DEFAULT 'pending' CHECK (status IN ('pending', 'approved', 'rejected')),
                referral_code TEXT UNIQUE,
                interested_features TEXT[]
            );
        "#,
    },
    Step {
        name: "Create Waitlist Indexes",
        sql: r#"
            CREATE INDEX idx_waitlist_email ON waitlist(email);
            CREATE INDEX idx_waitlist_created_at ON waitlist(created_at);
            CREATE INDEX idx_waitlist_status ON waitlist(status);
        "#,
    },
    Step {
        name: "Create Auto-Position Function",
        sql: r#"
            CREATE OR REPLACE FUNCTION assign_waitlist_position()
            RETURNS TRIGGER AS $$
            BEGIN
                SELECT COALESCE(MAX(position), 0) + 1 INTO NEW.position FROM waitlist;
                RETURN NEW;
            END;
            $$ LANGUAGE plpgsql;
        "#,
    },
    Step {
        name: "Create Position Trigger",
        sql: r#"
            CREATE TRIGGER waitlist_position_trigger
            BEFORE INSERT ON waitlist
            FOR EACH ROW
            EXECUTE FUNCTION assign_waitlist_position();
        "#,
    },
    Step {
        name: "Create Profiles Table",
        sql: r#"
            CREATE TABLE profiles (
                id UUID REFERENCES auth.users(id) ON DELETE CASCADE PRIMARY KEY,
                email TEXT,
                full_name TEXT,
                avatar_url TEXT,
                company_name TEXT,
                industry TEXT,
                role TEXT,
                preferences JSONB DEFAULT '{}',
                subscription_tier TEXT DEFAULT 'free',
                created_at TIMESTAMP WITH TIME ZONE DEFAULT TIMEZONE('utc', NOW()) NOT NULL,
                updated_at TIMESTAMP WITH TIME ZONE DEFAULT TIMEZONE('utc', NOW()) NOT NULL
            );
        "#,
    },
    Step {
        name: "Create Credits Table",
        sql: r#"
            CREATE TABLE credits (
                id UUID DEFAULT uuid_generate_v4() PRIMARY KEY,
                user_id UUID REFERENCES auth.users(id) ON DELETE CASCADE NOT NULL,
                total_credits INTEGER DEFAULT 0,
                used_credits INTEGER DEFAULT 0,
                rollover_credits INTEGER DEFAULT 0,
                reset_date TIMESTAMP WITH TIME ZONE NOT NULL,
                created_at TIMESTAMP WITH TIME ZONE DEFAULT TIMEZONE('utc', NOW()) NOT NULL,
                updated_at TIMESTAMP WITH TIME ZONE DEFAULT TIMEZONE('utc', NOW()) NOT NULL
            );
        "#,
    },
    Step {
        name: "Create Credits Index",
        sql: "CREATE INDEX idx_credits_user_id ON credits(user_id);",
    },
    Step {
        name: "Enable Row Level Security",
        sql: r#"
            ALTER TABLE waitlist ENABLE ROW LEVEL SECURITY;
            ALTER TABLE profiles ENABLE ROW LEVEL SECURITY;
            ALTER TABLE credits ENABLE ROW LEVEL SECURITY;
        "#,
    },
    Step {
        name: "Create Waitlist Policies",
        sql: r#"
            CREATE POLICY "Anyone can join waitlist" ON waitlist
                FOR INSERT WITH CHECK (true);

            CREATE POLICY "Only admins can view waitlist" ON waitlist
                FOR SELECT USING (auth.jwt() -> 'user_metadata' ->> 'role' = 'admin');
        "#,
    },
    Step {
        name: "Create Profile Policies",
        sql: r#"
            CREATE POLICY "Users can view own profile" ON profiles
                FOR SELECT USING (auth.uid() = id);

            CREATE POLICY "Users can update own profile" ON profiles
                FOR UPDATE USING (auth.uid() = id);
        "#,
    },
    Step {
        name: "Create Credits Policies",
        sql: r#"
            CREATE POLICY "Users can view own credits" ON credits
                FOR SELECT USING (auth.uid() = user_id);
        "#,
    },
    Step {
        name: "Create New User Handler Function",
        sql: r#"
            CREATE OR REPLACE FUNCTION public.handle_new_user()
            RETURNS TRIGGER AS $$
            BEGIN
                INSERT INTO public.profiles (id, email, full_name, avatar_url)
                VALUES (
                    NEW.id,
                    NEW.email,
                    NEW.raw_user_meta_data->>'full_name',
                    NEW.raw_user_meta_data->>'avatar_url'
                );

                -- Free tier starts with 10 credits
                INSERT INTO public.credits (user_id, total_credits, reset_date)
                VALUES (
                    NEW.id,
                    10,
                    DATE_TRUNC('month', CURRENT_DATE) + INTERVAL '1 month'
                );

                RETURN NEW;
            END;
            $$ LANGUAGE plpgsql SECURITY DEFINER;
        "#,
    },
    Step {
        name: "Create User Creation Trigger",
        sql: r#"
            CREATE TRIGGER on_auth_user_created
                AFTER INSERT ON auth.users
                FOR EACH ROW EXECUTE FUNCTION public.handle_new_user();
        "#,
    },
];
